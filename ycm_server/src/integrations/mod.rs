pub mod fareharbor;
