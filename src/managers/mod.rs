// Managers Module
//
// Focused manager classes, one concern each:
// - BroadcastChannelManager: Tokio broadcast channel management

pub mod broadcast_manager;

pub use broadcast_manager::BroadcastChannelManager;
