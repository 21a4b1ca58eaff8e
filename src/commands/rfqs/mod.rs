pub mod create_rfq_command;
pub mod record_rfq_quote_command;
pub mod replace_rfq_items_command;
pub mod update_rfq_command;

// Re-export commands for easier access
pub use create_rfq_command::CreateRfqCommand;
pub use record_rfq_quote_command::RecordRfqQuoteCommand;
pub use replace_rfq_items_command::ReplaceRfqItemsCommand;
pub use update_rfq_command::UpdateRfqCommand;
