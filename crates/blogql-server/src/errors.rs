use async_graphql::ErrorExtensions;
use blogql_store::StoreError;

/// Convert a store failure into a GraphQL error carrying `extensions.code`.
pub fn store_error(err: StoreError) -> async_graphql::Error {
    let code = err.code();
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_and_code_survive() {
        let err = store_error(StoreError::validation("Email taken"));
        assert_eq!(err.message, "Email taken");

        let ext = serde_json::to_value(err.extensions.unwrap()).unwrap();
        assert_eq!(ext["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn not_found_code() {
        let err = store_error(StoreError::NotFound { entity: "Post" });
        assert_eq!(err.message, "Post not found");
        let ext = serde_json::to_value(err.extensions.unwrap()).unwrap();
        assert_eq!(ext["code"], "NOT_FOUND");
    }
}
