#[actix_web::main]
async fn main() -> std::io::Result<()> {
    sustainalyze_lib::run().await
}
