pub mod admin_context;
