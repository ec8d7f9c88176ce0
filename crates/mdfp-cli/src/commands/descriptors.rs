use crate::cli::DescriptorsArgs;
use crate::error::Result;
use crate::utils::output;
use mdfp::core::descriptors::provider::StructuralDescriptorProvider;
use std::io::Write;
use tracing::info;

pub fn run(args: DescriptorsArgs) -> Result<()> {
    let stdout = std::io::stdout().lock();
    describe(&args, stdout)
}

fn describe<W: Write>(args: &DescriptorsArgs, writer: W) -> Result<()> {
    let provider = StructuralDescriptorProvider::new();

    let rows = args
        .smiles
        .iter()
        .map(|smiles| {
            let descriptors = provider.compute(smiles)?;
            Ok((smiles.clone(), descriptors))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(count = rows.len(), "Computed structural descriptors.");

    output::write_descriptors(writer, &rows, args.format)
}
