pub mod attention;
pub mod dense;
pub mod initialization;

pub use attention::{AttentionGate, GateTrace};
pub use dense::DenseLayer;
pub use initialization::WeightInit;
