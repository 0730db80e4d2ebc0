pub mod aggregation_service;
pub mod budget_service;
pub mod expense_service;
pub mod growth_service;
pub mod investment_service;
pub mod partner_service;
pub mod report_service;
