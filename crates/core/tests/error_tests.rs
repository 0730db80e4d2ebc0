// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use couple_finance_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api() {
        let err = CoreError::Api {
            table: "expenses".into(),
            status: 401,
            message: "JWT expired".into(),
        };
        assert_eq!(
            err.to_string(),
            "Backend error on table 'expenses' (HTTP 401): JWT expired"
        );
    }

    #[test]
    fn api_empty_message() {
        let err = CoreError::Api {
            table: "budgets".into(),
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "Backend error on table 'budgets' (HTTP 500): ");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad float".into());
        assert_eq!(err.to_string(), "Serialization error: bad float");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("missing field `id`".into());
        assert_eq!(err.to_string(), "Deserialization error: missing field `id`");
    }

    #[test]
    fn config() {
        let err = CoreError::Config("backend base URL must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: backend base URL must not be empty"
        );
    }

    #[test]
    fn partner_not_linked() {
        assert_eq!(
            CoreError::PartnerNotLinked.to_string(),
            "Partner not linked. Please link your partner first."
        );
    }

    #[test]
    fn partner_not_found() {
        let err = CoreError::PartnerNotFound("sam".into());
        assert_eq!(err.to_string(), "Partner not found with username 'sam'");
    }

    #[test]
    fn partner_already_linked() {
        assert_eq!(
            CoreError::PartnerAlreadyLinked.to_string(),
            "This user is already linked to another partner"
        );
    }

    #[test]
    fn self_link() {
        assert_eq!(
            CoreError::SelfLink.to_string(),
            "An account cannot be linked to itself"
        );
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("Expense category is required".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Expense category is required"
        );
    }

    #[test]
    fn record_not_found() {
        let err = CoreError::RecordNotFound {
            kind: "Budget".into(),
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "Budget not found: abc");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_serde_json_error_keeps_message() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1, \"two\"]").unwrap_err();
        let expected = json_err.to_string();
        let err: CoreError = json_err.into();
        match err {
            CoreError::Deserialization(msg) => assert_eq!(msg, expected),
            other => panic!("expected Deserialization, got {other:?}"),
        }
    }

    #[test]
    fn question_mark_propagates() {
        fn parse(input: &str) -> Result<u32, CoreError> {
            Ok(serde_json::from_str(input)?)
        }
        assert_eq!(parse("42").unwrap(), 42);
        assert!(matches!(parse("x"), Err(CoreError::Deserialization(_))));
    }
}

// ── Trait impls ─────────────────────────────────────────────────────

mod traits {
    use super::*;

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&CoreError::SelfLink);
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }

    #[test]
    fn debug_names_variant() {
        let dbg = format!("{:?}", CoreError::PartnerNotFound("kim".into()));
        assert!(dbg.contains("PartnerNotFound"));
        assert!(dbg.contains("kim"));
    }
}
