// Discord commands module.
// Each feature gets its own command file.

pub mod clip;

pub mod gdoc;

pub mod presence;
