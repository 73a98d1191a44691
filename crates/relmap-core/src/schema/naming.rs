//! Default constraint names and their uniquification.

/// `FK_{table}_{principal table}_{columns}`
pub fn foreign_key_name(table: &str, principal_table: &str, columns: &[&str]) -> String {
    format!("FK_{table}_{principal_table}_{}", columns.join("_"))
}

/// `IX_{table}_{columns}`
pub fn index_name(table: &str, columns: &[&str]) -> String {
    format!("IX_{table}_{}", columns.join("_"))
}

/// `PK_{table}`
pub fn primary_key_name(table: &str) -> String {
    format!("PK_{table}")
}

/// `AK_{table}_{columns}`
pub fn alternate_key_name(table: &str, columns: &[&str]) -> String {
    format!("AK_{table}_{}", columns.join("_"))
}

/// `CK_{table}_{name}`
pub fn check_constraint_name(table: &str, name: &str) -> String {
    format!("CK_{table}_{name}")
}

/// Shortens `name` to at most `max_len` characters including the optional
/// numeric suffix. A cut name ends with `~` before the suffix.
pub fn truncate(name: &str, max_len: usize, suffix: Option<usize>) -> String {
    let suffix = suffix.map(|n| n.to_string()).unwrap_or_default();
    let max_name_len = max_len.saturating_sub(suffix.len());

    let mut ret = if name.chars().count() <= max_name_len {
        name.to_string()
    } else {
        let mut cut = name
            .chars()
            .take(max_name_len.saturating_sub(1))
            .collect::<String>();
        cut.push('~');
        cut
    };

    ret.push_str(&suffix);
    ret
}

/// Picks a name for a generated constraint.
///
/// `is_taken` reports whether a candidate collides with a sibling that
/// cannot share the name. The base name is tried first, then the base name
/// with suffixes `0`, `1`, ... appended.
pub fn uniquify(base: &str, max_len: usize, mut is_taken: impl FnMut(&str) -> bool) -> String {
    let mut candidate = truncate(base, max_len, None);
    let mut suffix = 0;

    while is_taken(&candidate) {
        candidate = truncate(base, max_len, Some(suffix));
        suffix += 1;
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names() {
        assert_eq!(
            foreign_key_name("Orders", "Customers", &["CustomerId"]),
            "FK_Orders_Customers_CustomerId"
        );
        assert_eq!(index_name("Orders", &["Date", "Total"]), "IX_Orders_Date_Total");
        assert_eq!(primary_key_name("Orders"), "PK_Orders");
        assert_eq!(alternate_key_name("Orders", &["Code"]), "AK_Orders_Code");
        assert_eq!(check_constraint_name("Orders", "Total"), "CK_Orders_Total");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("IX_Orders", 63, None), "IX_Orders");
        assert_eq!(truncate("IX_Orders_Total", 10, None), "IX_Orders~");
        assert_eq!(truncate("IX_Orders_Total", 10, Some(12)), "IX_Orde~12");
        assert_eq!(truncate("IX_Orders", 11, Some(0)), "IX_Orders0");
    }

    #[test]
    fn suffixes_start_at_zero() {
        let taken = ["fk_a", "FK_A0"];
        let name = uniquify("FK_A", 128, |candidate| {
            taken.iter().any(|t| t.eq_ignore_ascii_case(candidate))
        });
        assert_eq!(name, "FK_A1");

        assert_eq!(uniquify("FK_A", 128, |_| false), "FK_A");
    }
}
