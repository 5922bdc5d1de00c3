//! # Nusabank - Core Banking Provisioning Library
//!
//! This is a facade crate that re-exports all public APIs from the banking core components.
//! Use this crate to get access to provisioning and PIN-lockout functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! nusabank = { path = "../nusabank" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `AccountNumber`, `CardNumber`, `Pin`, `User`, `Account`, `Card`, etc.
//! - **Port traits**: `UserStore`, `AccountStore`, `CardStore`, `ProvisioningStore`,
//!   `AttemptCounterStore`, `PinHasher`
//! - **Use cases**: `RegisterUseCase`, `IssueCardUseCase`, `SetPinUseCase`, `VerifyPinUseCase`
//! - **Adapters**: `PostgresBankStore`, `RedisAttemptCounterStore`, `Argon2PinHasher`, etc.

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use nusabank_core::*;
}

// Re-export most commonly used core types at the root level
pub use nusabank_core::{
    Account, AccountNumber, AccountStatus, Card, CardNumber, CardStatus, CardType, EmailAddress,
    KycStatus, PhoneNumber, Pin, User, UserStatus, luhn,
};

// ============================================================================
// Port Traits
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use nusabank_core::{
        AccountStore, AttemptCounterStore, CardStore, CounterStoreError, EntityStoreError,
        PinHasher, PinHasherError, ProvisioningStore, UserStore,
    };
}

// Re-export port traits at root level
pub use nusabank_core::{
    AccountStore, AttemptCounterStore, CardStore, CounterStoreError, EntityStoreError, PinHasher,
    PinHasherError, ProvisioningStore, UserStore,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use nusabank_application::*;
}

// Re-export use cases at root level
pub use nusabank_application::{
    IssueCardUseCase, RegisterUseCase, SetPinUseCase, VerifyPinUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use nusabank_adapters::persistence::*;
    }

    /// PIN hashing
    pub mod hashing {
        pub use nusabank_adapters::hashing::*;
    }

    /// Configuration
    pub mod config {
        pub use nusabank_adapters::config::*;
    }
}

// Re-export the common adapters at root level
pub use nusabank_adapters::{
    Argon2PinHasher, InMemoryAttemptCounterStore, InMemoryBankStore, PostgresBankStore,
    RedisAttemptCounterStore, Settings,
};
