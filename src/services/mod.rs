// Services layer - Stateless crypto and token logic
pub mod checkin_code;
pub mod crypto;
pub mod password_hasher;
pub mod token_service;

pub use checkin_code::CheckinCodeService;
pub use password_hasher::PasswordHasherService;
pub use token_service::TokenService;
