#[tokio::main]
async fn main() {
    if let Err(e) = rep_booking::run().await {
        eprintln!("rep-booking: {e}");
        std::process::exit(1);
    }
}
