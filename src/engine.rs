pub mod route_planner;
