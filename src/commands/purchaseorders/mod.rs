pub mod create_purchase_order_command;
pub mod record_purchase_order_quote_command;
pub mod replace_purchase_order_items_command;
pub mod update_purchase_order_command;

// Re-export commands for easier access
pub use create_purchase_order_command::CreatePurchaseOrderCommand;
pub use record_purchase_order_quote_command::RecordPurchaseOrderQuoteCommand;
pub use replace_purchase_order_items_command::ReplacePurchaseOrderItemsCommand;
pub use update_purchase_order_command::UpdatePurchaseOrderCommand;
