pub mod alert_client;
pub mod fuel_client;
pub mod report_client;

pub use alert_client::*;
pub use fuel_client::*;
pub use report_client::*;
