fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the proto file for the embedding client (and the test server)
    tonic_build::compile_protos("../../proto/embeddings.proto")?;
    Ok(())
}
