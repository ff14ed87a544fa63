//! Domain types and models
//!
//! Everything here is plain data with its wire encoding attached.

pub mod action;
pub mod api;
pub mod details;
pub mod redirect;
pub mod threeds2;

pub use action::{
    Action, AwaitAction, RedirectAction, ThreeDS2Action, ThreeDS2ChallengeAction,
    ThreeDS2FingerprintAction,
};
pub use api::{ApiErrorResponse, ApiErrorType};
pub use details::{ActionComponentData, ActionDetails, AwaitActionDetails};
pub use redirect::RedirectDetails;
pub use threeds2::{
    AuthenticationRequestParameters, ChallengeParameters, ChallengeResult, ChallengeToken,
    EphemeralPublicKey, Fingerprint, FingerprintToken, SdkError, ServiceParameters,
    ThreeDS2Details, ThreeDSActionHandlerResult, ThreeDSResult, ThreeDSResultPayload,
};
