pub mod create_purchase_request_command;
pub mod replace_purchase_request_items_command;
pub mod update_purchase_request_command;

// Re-export commands for easier access
pub use create_purchase_request_command::CreatePurchaseRequestCommand;
pub use replace_purchase_request_items_command::ReplacePurchaseRequestItemsCommand;
pub use update_purchase_request_command::UpdatePurchaseRequestCommand;
