mod conservation;
mod pricing;
