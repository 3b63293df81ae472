use fusebox_circuit::CircuitBreakerConfig;

pub fn execute(config: &CircuitBreakerConfig) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
