//! Cache level tests.


/// Set-associative read/write/write-back behaviour.
pub mod set_assoc;
