use wesaurus_types::{Definition, User};

/// Creates a test user with the given id and name
pub fn create_test_user(id: i32, name: &str) -> User {
    User {
        id,
        user_name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
        date_created: "2029-01-22T16:28:32.615Z".to_string(),
    }
}

/// Creates a definition authored by `author`
pub fn create_test_definition(id: i32, author: &User, text: &str) -> Definition {
    Definition {
        id,
        author_id: author.id,
        word_id: 1,
        text: text.to_string(),
        like_count: 0,
        date_created: "2029-01-22T16:28:32.615Z".to_string(),
        word_text: None,
    }
}

/// Every class of password the policy must reject, paired with the expected message
pub fn rejected_passwords() -> Vec<(&'static str, &'static str)> {
    vec![
        ("1234567", "Password must be longer than 8 characters"),
        ("", "Password must be longer than 8 characters"),
        (
            "Aa1!aaaaaaaaaaaaaaaaaaaaa",
            "Password must be less than 24 characters",
        ),
        (" 1Aa!2Bb@", "Password must not start or end with empty spaces"),
        ("1Aa!2Bb@ ", "Password must not start or end with empty spaces"),
        (
            "11AAaabb",
            "Password must contain 1 upper case, lower case, number and special character",
        ),
        (
            "aa11!!@@",
            "Password must contain 1 upper case, lower case, number and special character",
        ),
        (
            "AA11!!@@",
            "Password must contain 1 upper case, lower case, number and special character",
        ),
        (
            "AAaa!!@@",
            "Password must contain 1 upper case, lower case, number and special character",
        ),
    ]
}
