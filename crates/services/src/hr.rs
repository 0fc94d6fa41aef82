//! Employee records: recurring component and loan lifecycle.

use std::sync::Arc;

use rust_decimal::Decimal;

use kitabu_core::payroll::{
    DeductionCategory, DeductionComponent, EarningCategory, EarningComponent, Loan, LoanStatus,
};
use kitabu_shared::types::{ComponentId, EmployeeId, LoanId};
use kitabu_shared::{AppError, AppResult, TenantCtx};
use kitabu_store::documents::payroll::Employee;
use kitabu_store::DocumentStore;

/// Input for registering an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Staff number (e.g. "EMP-0042").
    pub staff_number: String,
    /// Full name.
    pub name: String,
    /// Contractual monthly base salary.
    pub basic_pay: Decimal,
}

/// Employee administration service.
#[derive(Clone)]
pub struct HrService {
    store: Arc<DocumentStore>,
}

impl HrService {
    /// Creates the service over a shared store.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Registers an active employee with no components or loans.
    pub fn create_employee(
        &self,
        ctx: &TenantCtx,
        input: &CreateEmployeeInput,
    ) -> AppResult<EmployeeId> {
        if input.basic_pay < Decimal::ZERO {
            return Err(AppError::Validation(
                "Basic pay cannot be negative".to_string(),
            ));
        }
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let employee = Employee {
                id: EmployeeId::new(),
                staff_number: input.staff_number.clone(),
                name: input.name.clone(),
                basic_pay: input.basic_pay,
                is_active: true,
                earnings: Vec::new(),
                deductions: Vec::new(),
                loans: Vec::new(),
            };
            let id = employee.id;
            tx.put(&store.employees, ctx.institution_id, id, employee);
            Ok(id)
        })
    }

    /// Attaches a recurring earning to an employee.
    pub fn add_earning(
        &self,
        ctx: &TenantCtx,
        employee_id: EmployeeId,
        name: &str,
        amount: Decimal,
        category: EarningCategory,
    ) -> AppResult<ComponentId> {
        if amount < Decimal::ZERO {
            return Err(AppError::Validation(
                "Earning amount cannot be negative".to_string(),
            ));
        }
        self.with_employee(ctx, employee_id, |employee| {
            let component = EarningComponent {
                id: ComponentId::new(),
                name: name.to_string(),
                amount,
                category,
            };
            let id = component.id;
            employee.earnings.push(component);
            Ok(id)
        })
    }

    /// Attaches a recurring deduction to an employee.
    pub fn add_deduction(
        &self,
        ctx: &TenantCtx,
        employee_id: EmployeeId,
        name: &str,
        amount: Decimal,
        category: DeductionCategory,
    ) -> AppResult<ComponentId> {
        if amount < Decimal::ZERO {
            return Err(AppError::Validation(
                "Deduction amount cannot be negative".to_string(),
            ));
        }
        self.with_employee(ctx, employee_id, |employee| {
            let component = DeductionComponent {
                id: ComponentId::new(),
                name: name.to_string(),
                amount,
                category,
            };
            let id = component.id;
            employee.deductions.push(component);
            Ok(id)
        })
    }

    /// Detaches a recurring component (earning or deduction).
    pub fn remove_component(
        &self,
        ctx: &TenantCtx,
        employee_id: EmployeeId,
        component_id: ComponentId,
    ) -> AppResult<()> {
        self.with_employee(ctx, employee_id, |employee| {
            let before = employee.earnings.len() + employee.deductions.len();
            employee.earnings.retain(|component| component.id != component_id);
            employee.deductions.retain(|component| component.id != component_id);
            if employee.earnings.len() + employee.deductions.len() == before {
                return Err(AppError::NotFound(format!("Component {component_id}")));
            }
            Ok(())
        })
    }

    /// Issues a loan recovered through payroll.
    pub fn add_loan(
        &self,
        ctx: &TenantCtx,
        employee_id: EmployeeId,
        principal: Decimal,
        monthly_recovery: Decimal,
    ) -> AppResult<LoanId> {
        if principal <= Decimal::ZERO || monthly_recovery <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Loan principal and monthly recovery must be positive".to_string(),
            ));
        }
        self.with_employee(ctx, employee_id, |employee| {
            let loan = Loan {
                id: LoanId::new(),
                principal,
                balance: principal,
                monthly_recovery,
                status: LoanStatus::Active,
            };
            let id = loan.id;
            employee.loans.push(loan);
            Ok(id)
        })
    }

    /// Deactivates an employee; future payroll runs skip them.
    pub fn deactivate_employee(&self, ctx: &TenantCtx, employee_id: EmployeeId) -> AppResult<()> {
        self.with_employee(ctx, employee_id, |employee| {
            employee.is_active = false;
            Ok(())
        })
    }

    fn with_employee<R>(
        &self,
        ctx: &TenantCtx,
        employee_id: EmployeeId,
        f: impl Fn(&mut Employee) -> AppResult<R>,
    ) -> AppResult<R> {
        let store = self.store.as_ref();
        store.run_transaction(|tx| {
            let mut employee = tx
                .read(&store.employees, ctx.institution_id, &employee_id)
                .ok_or_else(|| AppError::NotFound(format!("Employee {employee_id}")))?;
            let result = f(&mut employee)?;
            tx.put(&store.employees, ctx.institution_id, employee_id, employee);
            Ok(result)
        })
    }
}
