//! Approval-gated document flows: locked documents stay inert until a
//! decision lands, and budget breaches force sign-off.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use kitabu_core::approval::{ApprovalDecision, ApprovalLevel, ApprovalStatus, WorkflowPolicy};
use kitabu_core::budget::BudgetAllocation;
use kitabu_core::inventory::{MovementStatus, MovementType};
use kitabu_core::ledger::AccountType;
use kitabu_shared::types::{AccountId, InstitutionId, ProductId, UserId};
use kitabu_shared::{AppError, TenantCtx};
use kitabu_store::documents::setup::{
    ExpenseAccounts, InventoryAccounts, PurchasingAccounts, SalesAccounts, TenantSetup,
};
use kitabu_store::documents::trade::{InvoiceLine, InvoiceStatus, PurchaseOrderLine, PurchaseOrderStatus};
use kitabu_store::DocumentStore;
use kitabu_services::inventory::RecordMovementInput;
use kitabu_services::purchasing::CreatePurchaseOrderInput;
use kitabu_services::sales::CreateInvoiceInput;
use kitabu_services::expenses::CreateRequisitionInput;
use kitabu_services::{
    AdminService, ApprovalService, ExpenseService, InventoryService, PurchasingService, SalesService,
};

struct Fixture {
    store: Arc<DocumentStore>,
    ctx: TenantCtx,
    admin: AdminService,
    cash: AccountId,
    receivable: AccountId,
    stock_asset: AccountId,
    stationery: AccountId,
}

fn seeded() -> Fixture {
    let store = Arc::new(DocumentStore::default());
    let ctx = TenantCtx::new(InstitutionId::new(), UserId::new());
    let admin = AdminService::new(Arc::clone(&store));

    let account = |code: &str, name: &str, kind| admin.create_account(&ctx, code, name, kind).unwrap();
    let cash = account("1000", "Cash", AccountType::Asset);
    let receivable = account("1100", "Accounts Receivable", AccountType::Asset);
    let stock_asset = account("1200", "Stock on Hand", AccountType::Asset);
    let payable = account("2000", "Accounts Payable", AccountType::Liability);
    let wallet_liability = account("2300", "Wallet Liability", AccountType::Liability);
    let revenue = account("4000", "Revenue", AccountType::Income);
    let stationery = account("5100", "Stationery", AccountType::Expense);
    let shrinkage = account("5200", "Stock Shrinkage", AccountType::Expense);
    let adjustment = account("3100", "Stock Adjustments", AccountType::Equity);

    admin
        .set_tenant_setup(
            &ctx,
            TenantSetup {
                sales: Some(SalesAccounts {
                    accounts_receivable: receivable,
                    revenue,
                    cash,
                    wallet_liability,
                }),
                purchasing: Some(PurchasingAccounts {
                    accounts_payable: payable,
                }),
                inventory: Some(InventoryAccounts {
                    stock_asset,
                    shrinkage_expense: shrinkage,
                    adjustment_equity: adjustment,
                }),
                expenses: Some(ExpenseAccounts { cash }),
                ..TenantSetup::default()
            },
        )
        .unwrap();
    for (id, prefix) in [
        ("journal", "JE-"),
        ("invoice", "INV-"),
        ("purchase_order", "PO-"),
        ("requisition", "REQ-"),
    ] {
        admin.create_sequence(&ctx, id, prefix, 5).unwrap();
    }

    Fixture {
        store,
        ctx,
        admin,
        cash,
        receivable,
        stock_asset,
        stationery,
    }
}

fn policy(module: &str, levels: usize, threshold: Option<Decimal>) -> WorkflowPolicy {
    WorkflowPolicy {
        trigger_module: module.to_string(),
        levels: (1..=levels)
            .map(|n| ApprovalLevel {
                name: format!("Level {n}"),
                approver_role: "bursar".to_string(),
            })
            .collect(),
        auto_approve_threshold: threshold,
        is_active: true,
    }
}

fn approve_fully(fixture: &Fixture, request_id: kitabu_shared::types::ApprovalRequestId) {
    let approvals = ApprovalService::new(Arc::clone(&fixture.store));
    loop {
        let status = approvals
            .submit_decision(&fixture.ctx, request_id, ApprovalDecision::Approve, None)
            .unwrap();
        if status == ApprovalStatus::Approved {
            break;
        }
    }
}

#[test]
fn gated_invoice_stays_inert_until_approved() {
    let fixture = seeded();
    fixture
        .admin
        .create_workflow(&fixture.ctx, policy("sales", 2, Some(dec!(10000))))
        .unwrap();

    let sales = SalesService::new(Arc::clone(&fixture.store));
    let invoice_id = sales
        .create_invoice(
            &fixture.ctx,
            &CreateInvoiceInput {
                customer_name: "St. Monica Academy".to_string(),
                lines: vec![InvoiceLine {
                    description: "Term 2 boarding".to_string(),
                    quantity: dec!(1),
                    unit_price: dec!(45000),
                }],
                issued_on: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            },
        )
        .unwrap();

    let invoice = fixture
        .store
        .invoices
        .get(fixture.ctx.institution_id, &invoice_id)
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::PendingApproval);
    let request_id = invoice.approval_request_id.unwrap();

    // Posting attempts fail with a lock and leave no trace, no matter
    // how often they are retried.
    for _ in 0..3 {
        let err = sales.post_invoice(&fixture.ctx, invoice_id).unwrap_err();
        assert!(matches!(err, AppError::GovernanceLock(_)));
    }
    assert_eq!(
        fixture
            .store
            .journal_entries
            .scan(fixture.ctx.institution_id, |_, _| true)
            .len(),
        0
    );
    let receivable = fixture
        .store
        .accounts
        .get(fixture.ctx.institution_id, &fixture.receivable)
        .unwrap();
    assert_eq!(receivable.balance, Decimal::ZERO);

    approve_fully(&fixture, request_id);
    sales.post_invoice(&fixture.ctx, invoice_id).unwrap();
    sales.pay_invoice(&fixture.ctx, invoice_id).unwrap();

    let cash = fixture
        .store
        .accounts
        .get(fixture.ctx.institution_id, &fixture.cash)
        .unwrap();
    assert_eq!(cash.balance, dec!(45000));
    // Receivable was debited on posting and credited on payment.
    let receivable = fixture
        .store
        .accounts
        .get(fixture.ctx.institution_id, &fixture.receivable)
        .unwrap();
    assert_eq!(receivable.balance, Decimal::ZERO);
}

#[test]
fn rejected_invoice_cannot_post() {
    let fixture = seeded();
    fixture
        .admin
        .create_workflow(&fixture.ctx, policy("sales", 1, Some(dec!(10000))))
        .unwrap();

    let sales = SalesService::new(Arc::clone(&fixture.store));
    let invoice_id = sales
        .create_invoice(
            &fixture.ctx,
            &CreateInvoiceInput {
                customer_name: "St. Monica Academy".to_string(),
                lines: vec![InvoiceLine {
                    description: "Term 2 boarding".to_string(),
                    quantity: dec!(1),
                    unit_price: dec!(45000),
                }],
                issued_on: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            },
        )
        .unwrap();
    let request_id = fixture
        .store
        .invoices
        .get(fixture.ctx.institution_id, &invoice_id)
        .unwrap()
        .approval_request_id
        .unwrap();

    ApprovalService::new(Arc::clone(&fixture.store))
        .submit_decision(&fixture.ctx, request_id, ApprovalDecision::Reject, Some("duplicate".to_string()))
        .unwrap();

    let err = sales.post_invoice(&fixture.ctx, invoice_id).unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[test]
fn under_threshold_invoice_auto_approves() {
    let fixture = seeded();
    fixture
        .admin
        .create_workflow(&fixture.ctx, policy("sales", 2, Some(dec!(10000))))
        .unwrap();

    let sales = SalesService::new(Arc::clone(&fixture.store));
    let invoice_id = sales
        .create_invoice(
            &fixture.ctx,
            &CreateInvoiceInput {
                customer_name: "Day Scholar".to_string(),
                lines: vec![InvoiceLine {
                    description: "Activity fee".to_string(),
                    quantity: dec!(1),
                    unit_price: dec!(2500),
                }],
                issued_on: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            },
        )
        .unwrap();

    let invoice = fixture
        .store
        .invoices
        .get(fixture.ctx.institution_id, &invoice_id)
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert!(invoice.approval_request_id.is_none());
    sales.post_invoice(&fixture.ctx, invoice_id).unwrap();
}

#[test]
fn pending_write_off_defers_stock_and_ledger_effects() {
    let fixture = seeded();
    fixture
        .admin
        .create_workflow(&fixture.ctx, policy("inventory", 1, Some(dec!(10000))))
        .unwrap();
    let product_id = fixture
        .admin
        .create_product(&fixture.ctx, "LAB-MSCOPE", "Microscope", dec!(100))
        .unwrap();
    let inventory = InventoryService::new(Arc::clone(&fixture.store));
    inventory
        .record_stock_movement(
            &fixture.ctx,
            &RecordMovementInput {
                product_id,
                batch_id: None,
                movement_type: MovementType::In,
                quantity: dec!(300),
                description: "Opening stock".to_string(),
            },
        )
        .unwrap();

    // A 15,000 write-off crosses the 10,000 threshold.
    let movement_id = inventory
        .record_stock_movement(
            &fixture.ctx,
            &RecordMovementInput {
                product_id,
                batch_id: None,
                movement_type: MovementType::Damage,
                quantity: dec!(150),
                description: "Water damage in the lab store".to_string(),
            },
        )
        .unwrap();

    let movement = fixture
        .store
        .stock_movements
        .get(fixture.ctx.institution_id, &movement_id)
        .unwrap();
    assert_eq!(movement.status, MovementStatus::Pending);
    let stock_before = |f: &Fixture| {
        f.store
            .products
            .get(f.ctx.institution_id, &product_id)
            .unwrap()
            .total_stock
    };
    assert_eq!(stock_before(&fixture), dec!(300));

    // Completion is locked while the request is pending.
    let err = inventory
        .complete_pending_movement(&fixture.ctx, movement_id)
        .unwrap_err();
    assert!(matches!(err, AppError::GovernanceLock(_)));
    assert_eq!(stock_before(&fixture), dec!(300));

    approve_fully(&fixture, movement.approval_request_id.unwrap());
    inventory
        .complete_pending_movement(&fixture.ctx, movement_id)
        .unwrap();

    assert_eq!(stock_before(&fixture), dec!(150));
    // Opening write-up 30,000 less the 15,000 write-down.
    let stock_account = fixture
        .store
        .accounts
        .get(fixture.ctx.institution_id, &fixture.stock_asset)
        .unwrap();
    assert_eq!(stock_account.balance, dec!(15000.00));

    // A second completion attempt is invalid, not re-applied.
    let err = inventory
        .complete_pending_movement(&fixture.ctx, movement_id)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[test]
fn over_budget_order_routes_through_approval_despite_threshold() {
    let fixture = seeded();
    fixture
        .admin
        .create_workflow(&fixture.ctx, policy("purchases", 1, Some(dec!(50000))))
        .unwrap();
    fixture
        .admin
        .track_account_for_budget(&fixture.ctx, fixture.stationery)
        .unwrap();
    fixture
        .admin
        .create_fiscal_period(
            &fixture.ctx,
            "June 2024",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            vec![BudgetAllocation {
                account_id: fixture.stationery,
                limit: dec!(5000),
            }],
        )
        .unwrap();

    let purchasing = PurchasingService::new(Arc::clone(&fixture.store));
    let line = |unit_cost| PurchaseOrderLine {
        account_id: fixture.stationery,
        product_id: None,
        description: "Exercise books".to_string(),
        quantity: dec!(1),
        unit_cost,
    };

    // Well under the 50,000 threshold but over the 5,000 allocation.
    let po_id = purchasing
        .create_purchase_order(
            &fixture.ctx,
            &CreatePurchaseOrderInput {
                supplier_name: "Text Book Centre".to_string(),
                lines: vec![line(dec!(6000))],
                ordered_on: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            },
        )
        .unwrap();
    let order = fixture
        .store
        .purchase_orders
        .get(fixture.ctx.institution_id, &po_id)
        .unwrap();
    assert_eq!(order.status, PurchaseOrderStatus::PendingApproval);

    let err = purchasing.receive_goods(&fixture.ctx, po_id).unwrap_err();
    assert!(matches!(err, AppError::GovernanceLock(_)));

    approve_fully(&fixture, order.approval_request_id.unwrap());
    purchasing.receive_goods(&fixture.ctx, po_id).unwrap();
    let order = fixture
        .store
        .purchase_orders
        .get(fixture.ctx.institution_id, &po_id)
        .unwrap();
    assert_eq!(order.status, PurchaseOrderStatus::Received);

    // A within-allocation order under the threshold sails through.
    let po_id = purchasing
        .create_purchase_order(
            &fixture.ctx,
            &CreatePurchaseOrderInput {
                supplier_name: "Text Book Centre".to_string(),
                lines: vec![line(dec!(100))],
                ordered_on: NaiveDate::from_ymd_opt(2024, 7, 12).unwrap(),
            },
        )
        .unwrap();
    let order = fixture
        .store
        .purchase_orders
        .get(fixture.ctx.institution_id, &po_id)
        .unwrap();
    assert_eq!(order.status, PurchaseOrderStatus::Approved);
}

#[test]
fn requisition_disbursal_posts_once_authorized() {
    let fixture = seeded();
    fixture
        .admin
        .create_workflow(&fixture.ctx, policy("expenses", 1, Some(dec!(1000))))
        .unwrap();

    let expenses = ExpenseService::new(Arc::clone(&fixture.store));
    let requisition_id = expenses
        .create_requisition(
            &fixture.ctx,
            &CreateRequisitionInput {
                purpose: "Sports day transport".to_string(),
                amount: dec!(8000),
                expense_account_id: fixture.stationery,
            },
        )
        .unwrap();

    let err = expenses.disburse(&fixture.ctx, requisition_id).unwrap_err();
    assert!(matches!(err, AppError::GovernanceLock(_)));

    let request_id = fixture
        .store
        .requisitions
        .get(fixture.ctx.institution_id, &requisition_id)
        .unwrap()
        .approval_request_id
        .unwrap();
    approve_fully(&fixture, request_id);
    expenses.disburse(&fixture.ctx, requisition_id).unwrap();

    let cash = fixture
        .store
        .accounts
        .get(fixture.ctx.institution_id, &fixture.cash)
        .unwrap();
    assert_eq!(cash.balance, dec!(-8000));
    let charged = fixture
        .store
        .accounts
        .get(fixture.ctx.institution_id, &fixture.stationery)
        .unwrap();
    assert_eq!(charged.balance, dec!(8000));

    // Double disbursal is rejected.
    let err = expenses.disburse(&fixture.ctx, requisition_id).unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}
