// Security module for credential handling
//
// This module keeps the Figma access token out of logs, debug output and
// error messages. Only a short prefix is ever rendered.

pub mod token;

pub use token::AccessToken;
