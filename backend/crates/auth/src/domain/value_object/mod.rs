//! Value Object Module

pub mod email;
pub mod national_id;
pub mod user_id;
pub mod user_name;
pub mod user_password;

pub use email::Email;
pub use national_id::{NationalId, SealedNationalId};
pub use user_id::{UserId, parse_user_id};
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};
