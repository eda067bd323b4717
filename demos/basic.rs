use std::error::Error;

use truffle_ai::{AgentConfig, TruffleAI, TruffleConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let api_key = std::env::var("TRUFFLE_API_KEY")?;
    let mut config = TruffleConfig::new(api_key);
    if let Ok(base_url) = std::env::var("TRUFFLE_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    let client = TruffleAI::new(config)?;

    // Deploy a fresh agent
    println!("🚀 Deploying agent...");
    let mut agent = client
        .deploy_agent(
            AgentConfig::new(
                "Example Assistant",
                "Help users with their questions",
                "gpt-4",
            ),
            None,
        )
        .await?;
    println!("✅ Deployed agent {}", agent.id());

    // One-off task
    let result = agent.run("What is the capital of France?").await?;
    println!("💡 Run result: {}", result.data);

    // Stateful chat
    let chat = agent.chat();
    let reply = chat.send("Hello! What can you help me with?").await?;
    println!("💬 Agent says: {reply}");
    println!("   Transcript holds {} messages", chat.history().await.len());

    // Rename it, then clean up
    agent
        .update(truffle_ai::AgentUpdate {
            name: Some("Renamed Assistant".to_string()),
            ..Default::default()
        })
        .await?;
    println!("📝 Agent is now called {}", agent.config().name);

    agent.delete().await?;
    println!("👋 Agent deleted");

    Ok(())
}
