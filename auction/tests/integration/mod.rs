mod bidding_flow;
mod edge_cases;
mod error_cases;
mod file_store;
mod shared_store;
