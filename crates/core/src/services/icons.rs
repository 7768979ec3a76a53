use crate::{IconStore, SnsError};

pub async fn get_icon(icons: &dyn IconStore, username: &str) -> Result<String, SnsError> {
    icons.get_icon(username).await
}

/// Replaces the icon of `username` and returns the stored value.
pub async fn update_icon(icons: &dyn IconStore, username: &str, icon_image: String) -> Result<String, SnsError> {
    icons.put_icon(username, &icon_image).await?;
    Ok(icon_image)
}
