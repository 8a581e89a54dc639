//! # Integration Test Flows
//!
//! Exercises the bootstrap and coordinator sequences across the fully
//! assembled store: every partition registered, all seams faked.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use console_gateway::HttpMethod;

    use crate::integration::Harness;

    fn seed_merchant_record() -> Value {
        json!({
            "id": "m-42",
            "channel_token": "tok-42",
            "company": null
        })
    }

    // =========================================================================
    // Onboarding coordinator sequence
    // =========================================================================

    #[tokio::test]
    async fn test_company_submission_runs_full_onboarding_sequence() {
        let h = Harness::new();
        h.store
            .bootstrap("User.Merchant", seed_merchant_record())
            .await
            .unwrap();

        h.store
            .dispatch(
                "User.Merchant.AccountInfo/updateAccountInfo",
                json!({ "name": "ACME", "country": "DE" }),
            )
            .await
            .unwrap();

        h.gateway.ok(
            HttpMethod::Put,
            "admin/api/v1/merchants/company",
            json!({
                "id": "m-42",
                "channel_token": "tok-42",
                "company": { "name": "ACME", "country": "DE" }
            }),
        );

        let submitted = h
            .store
            .dispatch("User.Merchant.AccountInfo/submitAccountInfo", Value::Null)
            .await
            .unwrap();
        assert_eq!(submitted, Value::Bool(true));

        // (1) the merchant record is the server's authoritative copy
        let merchant = h.store.getter("User.Merchant/merchant").unwrap();
        assert_eq!(merchant["company"]["name"], "ACME");

        // (2) the onboarding step is marked complete
        let steps = h.store.getter("User.Merchant/completedSteps").unwrap();
        assert_eq!(steps, json!(["company"]));

        // (3) the watch is live, established exactly once
        assert_eq!(h.channel.connect_count(), 1);
        assert_eq!(
            h.store.getter("User.Notifications/isWatchingInited").unwrap(),
            Value::Bool(true)
        );

        // Submitting again re-runs the sequence but the watch stays single.
        h.gateway.ok(
            HttpMethod::Put,
            "admin/api/v1/merchants/company",
            json!({ "id": "m-42", "channel_token": "tok-42" }),
        );
        h.store
            .dispatch("User.Merchant.AccountInfo/submitAccountInfo", Value::Null)
            .await
            .unwrap();
        assert_eq!(h.channel.connect_count(), 1);
        // The step list did not grow a duplicate either.
        let steps = h.store.getter("User.Merchant/completedSteps").unwrap();
        assert_eq!(steps, json!(["company"]));
    }

    #[tokio::test]
    async fn test_submission_body_uses_wire_spelling() {
        let h = Harness::new();
        h.store
            .bootstrap("User.Merchant", seed_merchant_record())
            .await
            .unwrap();

        h.store
            .dispatch(
                "User.Merchant.AccountInfo/updateAccountInfo",
                json!({ "taxId": "DE-77", "registrationNumber": "HRB-9" }),
            )
            .await
            .unwrap();

        h.gateway
            .ok(HttpMethod::Put, "admin/api/v1/merchants/company", Value::Null);
        h.store
            .dispatch("User.Merchant.AccountInfo/submitAccountInfo", Value::Null)
            .await
            .unwrap();

        let call = h.gateway.calls().into_iter().next().unwrap();
        let body = call.body.unwrap();
        // The explicit form-to-record mapping produced snake_case keys.
        assert_eq!(body["tax_id"], "DE-77");
        assert_eq!(body["registration_number"], "HRB-9");
        assert!(body.get("taxId").is_none());
    }

    // =========================================================================
    // Page bootstraps
    // =========================================================================

    #[tokio::test]
    async fn test_project_page_bootstrap_new_then_edit() {
        let h = Harness::new();

        // Creation flow: no network traffic at all.
        h.store
            .bootstrap("Project", json!({ "id": "new", "name": "Universe" }))
            .await
            .unwrap();
        assert!(h.gateway.calls().is_empty());
        assert_eq!(
            h.store.getter("Project/projectPublicName").unwrap(),
            json!("Universe")
        );

        // Edit flow on the same session replaces the seeded record.
        h.gateway.ok(
            HttpMethod::Get,
            "admin/api/v1/projects/p-1",
            json!({ "item": { "id": "p-1", "name": { "en": "Shop" } } }),
        );
        h.store
            .bootstrap("Project", json!({ "id": "p-1" }))
            .await
            .unwrap();
        assert_eq!(
            h.store.getter("Project/projectPublicName").unwrap(),
            json!("Shop")
        );
    }

    #[tokio::test]
    async fn test_currency_selection_survives_restart() {
        let first = Harness::new();
        first
            .store
            .commit("Project/currencies", json!(["USD-EU", "GBP"]))
            .unwrap();

        // A new session over the same preference storage reproduces the
        // identical in-memory list.
        let second = Harness::with_prefs(first.prefs.clone());
        assert_eq!(
            second.store.getter("Project/currencies").unwrap(),
            json!(["USD-EU", "GBP"])
        );
        assert_eq!(
            second.store.getter("Project/currenciesDetailed").unwrap(),
            json!([
                { "currency": "USD", "region": "EU" },
                { "currency": "GBP", "region": "GBP" }
            ])
        );
    }

    #[tokio::test]
    async fn test_payment_method_failure_lands_in_error_sink() {
        let h = Harness::new();
        h.gateway
            .fail_connection(HttpMethod::Get, "admin/api/v1/merchants/m-1/methods/card");

        h.store
            .bootstrap(
                "PaymentMethod",
                json!({ "merchantId": "m-1", "paymentMethodId": "card" }),
            )
            .await
            .unwrap();

        let reports = h.sink.take();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("PaymentMethod:"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_loud_configuration_error() {
        let h = Harness::new();

        let err = h
            .store
            .dispatch("User.Billing/initState", Value::Null)
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        // Nothing was swallowed into the sink; the caller got the error.
        assert!(h.sink.is_empty());
    }
}
