pub mod errors;
pub mod html;
pub mod xlsx;

pub use errors::{error_to_response, html_error_response, ResultResp};

pub use html::{
    clear_session_cookie, html_response, redirect, redirect_with_cookie, session_cookie,
};
pub use xlsx::xlsx_response;
