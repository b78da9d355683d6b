//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock lines.  All tests run on the host (x86_64) with no
//! real hardware required.

mod line_controller_tests;
mod mock_hw;
