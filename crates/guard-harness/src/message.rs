//! Messages printed by the scanner

/// Text the scanner prints when a commit contains `statement`.
pub fn forbidden_statement_message(statement: &str) -> String {
    format!("You forgot to remove a {statement} in the following files")
}
