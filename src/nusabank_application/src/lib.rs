pub mod use_cases;

pub use use_cases::{
    allocate::{self, AllocationError, MAX_ALLOCATION_ATTEMPTS},
    issue_card::{IssueCardError, IssueCardUseCase},
    register::{RegisterError, RegisterUseCase},
    set_pin::{SetPinError, SetPinUseCase},
    verify_pin::{
        BLOCK_DURATION, FAILURE_WINDOW, MAX_PIN_FAILURES, VerifyPinError, VerifyPinUseCase,
    },
};
