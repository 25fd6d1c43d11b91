pub mod chaos_type;
