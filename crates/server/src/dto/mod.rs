mod feature;
mod route;
mod trip;

pub use feature::*;
pub use route::*;
pub use trip::*;
