mod cli;

use t4b_core::api::ApiError;

fn main() {
    if let Err(e) = cli::run() {
        if let Some(api) = e.downcast_ref::<ApiError>()
            && api.is_unauthorized()
        {
            // session is already gone; point the user back to login
            eprintln!("{api}");
            std::process::exit(1);
        }
        eprintln!("{e:#}"); // pretty anyhow chain
        std::process::exit(1);
    }
}
