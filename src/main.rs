use anyhow::Result;

fn main() -> Result<()> {
    studymap::run()
}
