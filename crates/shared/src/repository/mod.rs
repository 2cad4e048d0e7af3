mod cart;
mod order;
mod product;
mod user;

pub use self::cart::CartRepository;
pub use self::order::OrderRepository;
pub use self::product::ProductRepository;
pub use self::user::UserRepository;

/// Escapes `ILIKE` wildcards so user input matches literally under `ESCAPE '\'`.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like("tee"), "tee");
    }
}
