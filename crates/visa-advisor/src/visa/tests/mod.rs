mod common;
mod consulate;
mod routing;
