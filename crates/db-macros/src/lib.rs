use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Fields};

mod internals;

use internals::{codegen, parse};

/// Derives `SqlxSchema`, `SqlxCrud` and `SqlxFilterQuery` for a struct mapped to one table.
///
/// Struct attributes:
/// - `#[table_name = "..."]`: defaults to the snake-cased, pluralized struct name.
/// - `#[primary_key(columns = "a, b")]`: explicit (possibly composite) key, by field name.
///   Without it the `id` field is the key, and an integer `id` is `SERIAL`.
///
/// Field attributes:
/// - `#[column_name = "..."]`, `#[column_type = "..."]`, `#[column_default = "..."]`, `#[check = "..."]`
/// - `#[db_managed]`: never written by INSERT or UPDATE.
/// - `#[unique]`, `#[indexed]`, `#[sqlx_skip_column]`
/// - `#[foreign_key(referenced_table = "...", related_rust_type = "...", on_delete = "...", on_update = "...")]`
///
/// Fields of any type other than the known scalar types are stored as TEXT and must
/// implement `Display`, `FromStr` and `Default`.
#[proc_macro_derive(
    SqlxObject,
    attributes(
        table_name, primary_key, column_name, column_type, column_default,
        db_managed, check, unique, indexed, foreign_key, sqlx_skip_column
    )
)]
pub fn sqlx_object_derive(input: TokenStream) -> TokenStream {
    let input_ast = parse_macro_input!(input as DeriveInput);
    expand(&input_ast)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn expand(input_ast: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input_ast.ident;
    let row_struct_name = format_ident!("{}RowSqlx", struct_name);

    let fields = match &input_ast.data {
        Data::Struct(DataStruct { fields: Fields::Named(fields), .. }) => &fields.named,
        _ => return Err(syn::Error::new_spanned(input_ast, "SqlxObject can only be derived for structs with named fields")),
    };

    let options = parse::parse_table_options(input_ast)?;
    let fields_data = parse::get_fields_data(fields, &options)?;

    let row_struct = codegen::generate_row_struct(&row_struct_name, &fields_data);
    let schema_impl = codegen::generate_sqlx_schema_impl(struct_name, &row_struct_name, &options, &fields_data);
    let crud_impl = codegen::generate_sqlx_crud_impl(struct_name, &fields_data);
    let filter_query_impl = codegen::generate_sqlx_filter_query_impl(struct_name);
    let fetch_helpers = codegen::generate_fetch_helpers(struct_name, &fields_data);

    Ok(quote! {
        #row_struct
        #schema_impl
        #crud_impl
        #filter_query_impl
        #fetch_helpers
    })
}
