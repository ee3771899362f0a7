//! Integration tests for the data-quality rule engine.
//!
//! Each check is exercised against a small inline snapshot:
//! 1. Duplicate ids report every row sharing the id, and nothing else
//! 2. Null key / premium checks on both ledgers
//! 3. Negative premium booked, one issue per row
//! 4. Claims checks, including the reserve tolerance boundary
//! 5. Output ordering and the rendered issue_detail

use premium_recon_core::{
    quality::{self, Check, DqIssue},
    SourceStore,
};

const POLICY_HEADER: &str = "policy_id,effective_date,written_premium,product,state,broker\n";
const GL_HEADER: &str = "policy_id,booking_date,premium_booked,taxes,fees\n";
const CLAIM_HEADER: &str = "claim_id,policy_id,state,loss_date,incurred_loss,paid_loss,reserve\n";

fn build(policies: &str, gl: &str, claims: &str) -> SourceStore {
    SourceStore::from_readers(
        format!("{POLICY_HEADER}{policies}").as_bytes(),
        format!("{GL_HEADER}{gl}").as_bytes(),
        format!("{CLAIM_HEADER}{claims}").as_bytes(),
    )
    .expect("fixture should load")
}

fn only(issues: &[DqIssue], check: Check) -> Vec<&DqIssue> {
    issues
        .iter()
        .filter(|i| i.table_name == check.table().name() && i.check_name == check.name())
        .collect()
}

fn detail(issue: &DqIssue) -> serde_json::Value {
    serde_json::from_str(&issue.issue_detail).expect("issue_detail is JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: duplicate_policy_id
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn duplicate_policy_id_reports_every_row_sharing_the_id() {
    let store = build(
        concat!(
            "P1,2024-01-01,1000,Landlord,IL,Broker A\n",
            "P2,2024-01-02,2000,Landlord,TX,Broker B\n",
            "P1,2024-01-03,1100,Landlord,IL,Broker A\n",
            "P3,2024-01-04,3000,Multi-Family,FL,Broker C\n",
            ",2024-01-05,500,Landlord,GA,Broker A\n",
            "P3,2024-01-06,3000,Multi-Family,FL,Broker C\n",
            "P1,2024-01-07,1200,Landlord,IL,Broker A\n",
            ",2024-01-08,600,Landlord,GA,Broker A\n",
        ),
        "",
        "",
    );

    let issues = quality::evaluate_check(&store, Check::DuplicatePolicyId).unwrap();
    let ids: Vec<_> = issues.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(
        ids,
        vec![Some("P1"), Some("P1"), Some("P3"), Some("P3"), Some("P1")],
        "all rows of duplicated ids, in input order; null ids never form a group"
    );

    let premiums: Vec<_> = issues
        .iter()
        .map(|i| detail(i)["written_premium"].as_f64())
        .collect();
    assert_eq!(
        premiums,
        vec![Some(1000.0), Some(1100.0), Some(3000.0), Some(3000.0), Some(1200.0)]
    );
}

#[test]
fn unique_ids_produce_no_duplicate_issues() {
    let store = build(
        concat!(
            "P1,2024-01-01,1000,Landlord,IL,Broker A\n",
            "P2,2024-01-02,2000,Landlord,TX,Broker B\n",
        ),
        "",
        "",
    );
    let issues = quality::evaluate_check(&store, Check::DuplicatePolicyId).unwrap();
    assert!(issues.is_empty(), "unexpected duplicates: {issues:?}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: null_key_or_premium on both ledgers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn null_key_or_premium_flags_both_ledgers_separately() {
    let store = build(
        concat!(
            "P1,2024-01-01,,Landlord,IL,Broker A\n",
            ",2024-01-02,2000,Landlord,TX,Broker B\n",
            "P3,2024-01-03,3000,Landlord,FL,Broker C\n",
            "P4,2024-01-04,NaN,Landlord,FL,Broker C\n",
        ),
        concat!(
            ",2024-01-10,100,5,10\n",
            "P1,2024-01-11,,0,10\n",
            "P3,2024-01-12,3000,150,10\n",
        ),
        "",
    );
    let issues = quality::evaluate(&store).unwrap();

    let policy_nulls = only(&issues, Check::PolicyNullKeyOrPremium);
    let ids: Vec<_> = policy_nulls.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("P1"), None, Some("P4")]);
    assert!(policy_nulls.iter().all(|i| i.table_name == "policies"));

    let gl_nulls = only(&issues, Check::GlNullKeyOrPremium);
    let ids: Vec<_> = gl_nulls.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(ids, vec![None, Some("P1")]);
    assert!(gl_nulls.iter().all(|i| i.table_name == "accounting_gl"));
    assert!(gl_nulls.iter().all(|i| i.check_name == "null_key_or_premium"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: negative_premium_booked
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn negative_premium_booked_one_issue_per_negative_row() {
    let store = build(
        "",
        concat!(
            "P1,2024-01-10,-100,5,10\n",
            "P1,2024-01-11,0,0,10\n",
            "P2,2024-01-12,250,12.5,10\n",
            "P3,2024-01-13,-0.01,0,10\n",
            "P4,2024-01-14,,0,10\n",
        ),
        "",
    );
    let issues = quality::evaluate_check(&store, Check::NegativePremiumBooked).unwrap();
    let booked: Vec<_> = issues
        .iter()
        .map(|i| detail(i)["premium_booked"].as_f64().unwrap())
        .collect();
    assert_eq!(booked, vec![-100.0, -0.01], "zero, positive and null rows are not negative");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: claims checks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn overpaid_claim_with_wrong_reserve_yields_two_issues() {
    let store = build("", "", "C1,P1,IL,2024-02-01,100,150,50\n");
    let issues = quality::evaluate(&store).unwrap();

    let checks: Vec<_> = issues.iter().map(|i| i.check_name.as_str()).collect();
    assert_eq!(checks, vec!["paid_greater_than_incurred", "reserve_mismatch"]);
    assert_eq!(issues[0].issue_detail, issues[1].issue_detail);
    assert!(issues.iter().all(|i| i.policy_id.as_deref() == Some("P1")));
}

#[test]
fn reserve_mismatch_boundary_is_strict() {
    let store = build(
        "",
        "",
        concat!(
            "C1,P1,IL,2024-02-01,0.01,0,0\n",
            "C2,P2,IL,2024-02-02,100,40,60\n",
            "C3,P3,IL,2024-02-03,100,40,61\n",
            "C4,P4,IL,2024-02-04,100,40,\n",
        ),
    );
    let issues = quality::evaluate_check(&store, Check::ReserveMismatch).unwrap();
    let ids: Vec<_> = issues.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(
        ids,
        vec![Some("P3")],
        "a difference of exactly 0.01 must not trigger; a null reserve cannot be compared"
    );
}

#[test]
fn reserve_on_the_decimal_boundary_does_not_trigger() {
    let store = build(
        "",
        "",
        concat!(
            "C1,P1,IL,2024-02-01,100.01,0,100\n",
            "C2,P2,IL,2024-02-02,100.02,0,100\n",
        ),
    );
    let issues = quality::evaluate_check(&store, Check::ReserveMismatch).unwrap();
    let ids: Vec<_> = issues.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("P2")], "100.01 - 100 is exactly the tolerance in decimal");
}

#[test]
fn claim_key_and_loss_sign_checks() {
    let store = build(
        "",
        "",
        concat!(
            ",P1,IL,2024-02-01,100,50,50\n",
            "C2,,TX,2024-02-02,100,50,50\n",
            "C3,P3,TX,2024-02-03,-10,-20,10\n",
            "C4,P4,FL,2024-02-04,100,50,50\n",
        ),
    );
    let issues = quality::evaluate(&store).unwrap();

    let nulls = only(&issues, Check::NullClaimOrPolicyId);
    assert_eq!(nulls.len(), 2);
    assert_eq!(nulls[0].policy_id.as_deref(), Some("P1"));
    assert_eq!(nulls[1].policy_id, None);

    let negative = only(&issues, Check::NegativeIncurredLoss);
    assert_eq!(negative.len(), 1);
    assert_eq!(detail(negative[0])["claim_id"], "C3");

    assert!(only(&issues, Check::PaidGreaterThanIncurred).is_empty());
    assert!(only(&issues, Check::ReserveMismatch).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: ordering and issue_detail
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn issues_are_grouped_in_check_order() {
    let store = build(
        concat!(
            "P1,2024-01-01,,Landlord,IL,Broker A\n",
            "P1,2024-01-02,1000,Landlord,IL,Broker A\n",
        ),
        "P1,2024-01-10,-5,0,1\n",
        "C1,P1,IL,2024-02-01,-1,0,5\n",
    );
    let issues = quality::evaluate(&store).unwrap();
    let labels: Vec<_> = issues
        .iter()
        .map(|i| format!("{}.{}", i.table_name, i.check_name))
        .collect();
    assert_eq!(
        labels,
        vec![
            "policies.duplicate_policy_id",
            "policies.duplicate_policy_id",
            "policies.null_key_or_premium",
            "accounting_gl.negative_premium_booked",
            "claims.negative_incurred_loss",
            "claims.paid_greater_than_incurred",
            "claims.reserve_mismatch",
        ]
    );
}

#[test]
fn issue_detail_renders_the_full_row_in_schema_order() {
    let store = build(
        "",
        "",
        "C9,P7,NC,2024-03-01,200,250,1\n",
    );
    let issues = quality::evaluate_check(&store, Check::PaidGreaterThanIncurred).unwrap();
    assert_eq!(issues.len(), 1);

    let row = detail(&issues[0]);
    let keys: Vec<_> = row.as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["claim_id", "policy_id", "state", "loss_date", "incurred_loss", "paid_loss", "reserve"]
    );
    assert_eq!(row["claim_id"], "C9");
    assert_eq!(row["state"], "NC");
    assert_eq!(row["incurred_loss"].as_f64(), Some(200.0));
    assert_eq!(row["paid_loss"].as_f64(), Some(250.0));
}

#[test]
fn na_tokens_are_recorded_as_missing_premium() {
    let store = build(
        concat!(
            "P1,2024-01-01,N/A,Landlord,IL,Broker A\n",
            "P2,2024-01-02,NULL,Landlord,TX,Broker B\n",
            "NA,2024-01-03,300,Landlord,FL,Broker C\n",
            "P4,2024-01-04,400,Landlord,GA,Broker A\n",
        ),
        concat!(
            "P1,2024-01-10,None,0,1\n",
            "#N/A,2024-01-11,50,2.5,1\n",
        ),
        "",
    );
    let issues = quality::evaluate(&store).unwrap();

    let policy_nulls = only(&issues, Check::PolicyNullKeyOrPremium);
    let ids: Vec<_> = policy_nulls.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("P1"), Some("P2"), None]);
    assert!(detail(policy_nulls[0])["written_premium"].is_null());

    let gl_nulls = only(&issues, Check::GlNullKeyOrPremium);
    let ids: Vec<_> = gl_nulls.iter().map(|i| i.policy_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("P1"), None]);
}

#[test]
fn null_fields_render_as_json_null() {
    let store = build(",2024-01-01,,Landlord,,Broker A\n", "", "");
    let issues = quality::evaluate_check(&store, Check::PolicyNullKeyOrPremium).unwrap();
    let row = detail(&issues[0]);
    assert!(row["policy_id"].is_null());
    assert!(row["written_premium"].is_null());
    assert!(row["state"].is_null());
    assert_eq!(row["product"], "Landlord");
}

#[test]
fn clean_snapshot_has_no_issues() {
    let store = build(
        "P1,2024-01-01,1000,Landlord,IL,Broker A\n",
        "P1,2024-01-10,1000,50,20\n",
        "C1,P1,IL,2024-02-01,100,40,60\n",
    );
    let issues = quality::evaluate(&store).unwrap();
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}
