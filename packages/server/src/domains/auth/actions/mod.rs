//! Auth domain actions - signup, code verification and account views

mod current_user;
mod send_otp;
mod verify_otp;

pub use current_user::{get_current_user, get_public_profile, CurrentUser, PublicProfile};
pub use send_otp::{send_otp, SendOtpResult};
pub use verify_otp::{verify_otp, VerifyOtpResult};
