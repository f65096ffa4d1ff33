pub mod i_type;
pub mod j_type;
pub mod r_type;

pub use i_type::IArgs;
pub use j_type::JArgs;
pub use r_type::RArgs;
