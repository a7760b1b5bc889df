pub mod campaigns;
pub mod collection_detail;
pub mod help;
pub mod home;
pub mod leads;
pub mod login;

pub use campaigns::{campaigns_page, CampaignsVm};
pub use collection_detail::{collection_detail_page, detail_url, CollectionDetailVm};
pub use help::help_page;
pub use home::{home_page, HomeVm};
pub use leads::{collections_page, collections_url, CollectionsVm};
pub use login::{code_page, login_page};
