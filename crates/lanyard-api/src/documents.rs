//! Fixed GraphQL document texts for the four service operations.
//!
//! The service schema is fixed; these documents request exactly the
//! `UserData` and `TagData` field sets the client decodes. Parameter names
//! (`search`, `offset`, `n`, `id`, `only_current`, `user`, `tag`, `checkin`)
//! are part of the service contract and must not change.
//!
//! Each document is self-contained (operations carry their own fragment
//! copies) so it can be posted as a single `query` string.

/// Names of the per-user application questions the client requests.
///
/// The service stores free-form question/answer pairs; the check-in client
/// only ever needs this fixed set.
pub const QUESTION_NAMES: [&str; 5] = [
    "major",
    "school",
    "tshirt-size",
    "dietary-restrictions",
    "optional-items",
];

/// Search for users by name or email fragment.
pub const USER_SEARCH: &str = r#"
query UserSearch($search: String!, $offset: Int!, $n: Int!) {
    search_user_simple(search: $search, offset: $offset, n: $n, filter: { confirmed: true, accepted: true }) {
        ...UserData
    }
}

fragment UserData on User {
    id
    applied
    accepted
    confirmed
    confirmationBranch
    application {
        type
    }
    confirmation {
        type
    }
    name
    email
    questions(names: ["major", "school", "tshirt-size", "dietary-restrictions", "optional-items"]) {
        name
        answer
    }
}
"#;

/// Fetch a single user by id, along with their per-tag check-in state.
pub const USER_GET: &str = r#"
query UserGet($id: ID!) {
    user(id: $id) {
        ...UserData
        tags {
            ...TagData
        }
    }
}

fragment UserData on User {
    id
    applied
    accepted
    confirmed
    confirmationBranch
    application {
        type
    }
    confirmation {
        type
    }
    name
    email
    questions(names: ["major", "school", "tshirt-size", "dietary-restrictions", "optional-items"]) {
        name
        answer
    }
}

fragment TagData on TagState {
    tag {
        name
    }
    checked_in
    checkin_success
    last_successful_checkin {
        checked_in_date
        checked_in_by
    }
}
"#;

/// List check-in tag names, optionally only currently active ones.
pub const TAGS_GET: &str = r#"
query TagsGet($only_current: Boolean!) {
    tags(only_current: $only_current) {
        name
    }
}
"#;

/// Check a user in to or out of a tag.
pub const CHECK_IN_TAG: &str = r#"
mutation CheckInTag($id: ID!, $tag: String!, $checkin: Boolean!) {
    check_in(user: $id, tag: $tag, checkin: $checkin) {
        user {
            ...UserData
        }
        tags {
            ...TagData
        }
    }
}

fragment UserData on User {
    id
    applied
    accepted
    confirmed
    confirmationBranch
    application {
        type
    }
    confirmation {
        type
    }
    name
    email
    questions(names: ["major", "school", "tshirt-size", "dietary-restrictions", "optional-items"]) {
        name
        answer
    }
}

fragment TagData on TagState {
    tag {
        name
    }
    checked_in
    checkin_success
    last_successful_checkin {
        checked_in_date
        checked_in_by
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_use_contract_parameter_names() {
        assert!(USER_SEARCH.contains("search_user_simple(search: $search, offset: $offset, n: $n"));
        assert!(USER_SEARCH.contains("filter: { confirmed: true, accepted: true }"));
        assert!(USER_GET.contains("user(id: $id)"));
        assert!(TAGS_GET.contains("tags(only_current: $only_current)"));
        assert!(CHECK_IN_TAG.contains("check_in(user: $id, tag: $tag, checkin: $checkin)"));
    }

    #[test]
    fn test_user_data_fragment_requests_all_fields() {
        for field in [
            "id",
            "applied",
            "accepted",
            "confirmed",
            "confirmationBranch",
            "application",
            "confirmation",
            "name",
            "email",
        ] {
            assert!(USER_GET.contains(field), "missing field {field}");
        }
        for question in QUESTION_NAMES {
            assert!(USER_GET.contains(question), "missing question {question}");
        }
    }

    #[test]
    fn test_tag_data_fragment_requests_all_fields() {
        for field in [
            "checked_in",
            "checkin_success",
            "last_successful_checkin",
            "checked_in_date",
            "checked_in_by",
        ] {
            assert!(CHECK_IN_TAG.contains(field), "missing field {field}");
        }
    }
}
