pub mod models;
pub mod responses;

pub use models::{OperationType, Privilege, PrivilegeHistory, PrivilegeStatus, Ticket, TicketStatus};
pub use responses::{
    BalanceHistory, ErrorDescription, ErrorResponse, FlightResponse, Page, PrivilegeInfoResponse,
    PrivilegeShortInfo, TicketPurchaseRequest, TicketPurchaseResponse, TicketResponse,
    UserInfoResponse, ValidationErrorResponse,
};
