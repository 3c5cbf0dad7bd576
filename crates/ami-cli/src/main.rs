//! whoami-check - image provenance audit for EC2 instances

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ami_cli::run().await
}
