use md5::{Digest, Md5};

/// Object key of a user's icon in the icon bucket: lowercase hex md5 of the username.
pub fn icon_object_key(username: &str) -> String {
    hex::encode(Md5::digest(username.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_object_key() {
        assert_eq!(icon_object_key("alice"), "6384e2b2184bcbf58eccf10ca7a6563c");
        assert_eq!(icon_object_key("bob"), "9f9d51bc70ef21ca5c14f307980a29d8");
        assert_eq!(icon_object_key("alice").len(), 32);
    }
}
