/// `ProductCard` -> `product_card`.
///
/// Inserts `_` before every uppercase letter except the first character, then
/// lowercases. Runs of capitals are not grouped: `HTMLView` -> `h_t_m_l_view`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::snake_case;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("ProductCard"), "product_card");
        assert_eq!(snake_case("AdminLayout"), "admin_layout");
        assert_eq!(snake_case("UserProfileHeader"), "user_profile_header");
        assert_eq!(snake_case("card"), "card");
        assert_eq!(snake_case("HTMLView"), "h_t_m_l_view");
    }

    #[test]
    fn test_snake_case_is_stable_on_its_output() {
        for name in ["ProductCard", "AdminLayout", "UserProfileHeader"] {
            let once = snake_case(name);
            assert_eq!(snake_case(&once), once);
        }
    }
}
