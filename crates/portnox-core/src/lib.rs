// portnox-core: Reconciliation and resource operations for Portnox MAC-based accounts.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod outcome;
pub mod reconcile;
pub mod resources;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ProviderConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Account, DeclaredOrder, MacEntry, VendorEntry};
pub use outcome::{Diagnostic, ReadOutcome, Severity};
pub use reconcile::ReconcilePlan;
pub use resources::{
    AccountConfig, AccountState, AddressConfig, AddressState, AddressesConfig, AddressesState,
    ImportId, Provider,
};

pub use portnox_api::DEFAULT_BASE_URL;
