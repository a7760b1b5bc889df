mod auth_flow_tests;
mod campaigns_tests;
mod collections_tests;
mod leads_tests;
