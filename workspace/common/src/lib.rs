//! Transport-layer types shared between the compute crate and the HTTP
//! handlers. These structs are the JSON shapes of the summary endpoints,
//! so the compute functions can build them directly and the handlers can
//! serve them without re-mapping.

mod summaries;
mod window;

pub use summaries::{
    AccountOutstanding, FuelSummary, SalaryComponents, SpendBreakdown, TicketSummary,
    TicketTypeSummary, VehicleFuelSummary,
};
pub use window::DateWindow;
