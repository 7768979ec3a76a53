use syn::{Attribute, DeriveInput, Expr, ExprLit, Field, Lit, LitStr, Meta};
use quote::format_ident;

use super::types::{
    default_table_name, get_option_inner_type, is_integer_type, is_option_type, is_simple_type,
    map_rust_type_to_sql, FieldData, ForeignKeyInfo, TableOptions, DEFAULT_REFERENTIAL_ACTION,
};

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn find_attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}

/// Value of a `#[name = "value"]` attribute.
fn name_value_str(attr: &Attribute) -> syn::Result<String> {
    match &attr.meta {
        Meta::NameValue(mnv) => match &mnv.value {
            Expr::Lit(ExprLit { lit: Lit::Str(lit_str), .. }) => Ok(lit_str.value()),
            other => Err(syn::Error::new_spanned(other, "attribute value must be a string literal")),
        },
        other => Err(syn::Error::new_spanned(other, "attribute must be a name-value pair like #[name = \"value\"]")),
    }
}

fn optional_name_value_str(attrs: &[Attribute], name: &str) -> syn::Result<Option<String>> {
    find_attr(attrs, name).map(name_value_str).transpose()
}

pub fn parse_table_options(input: &DeriveInput) -> syn::Result<TableOptions> {
    let table_name = optional_name_value_str(&input.attrs, "table_name")?
        .unwrap_or_else(|| default_table_name(&input.ident.to_string()));

    let mut primary_key = None;
    if let Some(attr) = find_attr(&input.attrs, "primary_key") {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("columns") {
                let columns: LitStr = meta.value()?.parse()?;
                let names: Vec<String> = columns.value()
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if names.is_empty() {
                    return Err(meta.error("primary_key columns must not be empty"));
                }
                primary_key = Some(names);
                Ok(())
            } else {
                Err(meta.error("unknown primary_key option, expected `columns`"))
            }
        })?;
    }

    Ok(TableOptions { table_name, primary_key })
}

pub fn parse_foreign_key_attr(field: &Field) -> syn::Result<Option<ForeignKeyInfo>> {
    let Some(attr) = find_attr(&field.attrs, "foreign_key") else {
        return Ok(None);
    };

    let mut referenced_table = None;
    let mut related_rust_type = None;
    let mut on_delete = DEFAULT_REFERENTIAL_ACTION.to_string();
    let mut on_update = DEFAULT_REFERENTIAL_ACTION.to_string();

    attr.parse_nested_meta(|meta| {
        let value: LitStr = meta.value()?.parse()?;
        if meta.path.is_ident("referenced_table") {
            referenced_table = Some(value.value());
        } else if meta.path.is_ident("related_rust_type") {
            related_rust_type = Some(format_ident!("{}", value.value()));
        } else if meta.path.is_ident("on_delete") {
            on_delete = value.value().to_uppercase();
        } else if meta.path.is_ident("on_update") {
            on_update = value.value().to_uppercase();
        } else {
            return Err(meta.error("unknown foreign_key option"));
        }
        Ok(())
    })?;

    match (referenced_table, related_rust_type) {
        (Some(referenced_table), Some(related_rust_type)) => Ok(Some(ForeignKeyInfo {
            referenced_table,
            related_rust_type,
            on_delete,
            on_update,
        })),
        _ => Err(syn::Error::new_spanned(attr, "foreign_key requires referenced_table and related_rust_type")),
    }
}

/// Gathers all relevant data from the struct's fields.
pub fn get_fields_data(
    fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>,
    options: &TableOptions,
) -> syn::Result<Vec<FieldData>> {
    let mut fields_data = Vec::new();

    for field in fields.iter() {
        let Some(field_ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "SqlxObject fields must be named"));
        };
        let field_name = field_ident.to_string();
        let field_ty = &field.ty;
        let field_is_option = is_option_type(field_ty);
        let field_is_skipped = has_attr(field, "sqlx_skip_column");

        let field_is_pk = match &options.primary_key {
            Some(columns) => columns.iter().any(|c| c == &field_name),
            None => field_name == "id",
        };
        let field_is_auto_pk = options.primary_key.is_none() && field_is_pk && is_integer_type(field_ty);

        let type_for_analysis = get_option_inner_type(field_ty).unwrap_or_else(|| field_ty.clone());
        let column_type = optional_name_value_str(&field.attrs, "column_type")?;
        let sql_type = if field_is_skipped {
            "SKIP".to_string()
        } else if let Some(column_type) = column_type {
            column_type
        } else {
            map_rust_type_to_sql(&type_for_analysis, field_is_auto_pk)
        };

        fields_data.push(FieldData {
            column: optional_name_value_str(&field.attrs, "column_name")?.unwrap_or_else(|| field_name.clone()),
            ident: field_ident,
            ty: field_ty.clone(),
            is_option: field_is_option,
            is_pk: field_is_pk,
            is_auto_pk: field_is_auto_pk,
            is_skipped: field_is_skipped,
            is_text_mapped: !field_is_skipped && !is_simple_type(&type_for_analysis),
            is_db_managed: has_attr(field, "db_managed"),
            sql_type,
            column_default: optional_name_value_str(&field.attrs, "column_default")?,
            check: optional_name_value_str(&field.attrs, "check")?,
            foreign_key: parse_foreign_key_attr(field)?,
            unique: has_attr(field, "unique"),
            indexed: has_attr(field, "indexed"),
        });
    }

    if let Some(columns) = &options.primary_key {
        for column in columns {
            if !fields_data.iter().any(|f| &f.ident.to_string() == column) {
                return Err(syn::Error::new(
                    proc_macro2::Span::call_site(),
                    format!("primary_key column '{}' is not a field of the struct", column),
                ));
            }
        }
    } else if !fields_data.iter().any(|f| f.is_pk) {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "SqlxObject needs an `id` field or #[primary_key(columns = \"...\")]",
        ));
    }

    Ok(fields_data)
}
