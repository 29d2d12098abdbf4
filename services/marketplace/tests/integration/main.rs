mod pro_profile_test;
mod router_test;
mod user_test;
mod webhook_test;
