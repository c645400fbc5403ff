/// Masks all but the last four characters of a credential, e.g. `****f00d`. Values of four characters or fewer are
/// masked completely.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail = value.chars().skip(count - 4).collect::<String>();
    format!("****{tail}")
}
