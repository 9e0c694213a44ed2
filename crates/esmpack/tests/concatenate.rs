use std::sync::Arc;

use esmpack::{
  concatenate, normalize_options, BuildContext, Compilation, CompilerOptions, ConcatConfiguration,
  ConcatenatedModule, Dependency, DependencyKind, ModuleBuildError, ModuleBuilder, ModuleIdx,
  RuntimeSpec,
};
use futures::future::BoxFuture;
use oxc::span::Span;

struct Fixture {
  compilation: Compilation,
  index: ModuleIdx,
  inner: ModuleIdx,
  other: ModuleIdx,
  index_to_inner: esmpack::DependencyIdx,
  other_to_index: esmpack::DependencyIdx,
  chunk: esmpack::ChunkIdx,
}

/// `./other.js` imports `./index.js`, which imports `./inner.js`. `./index.js` and `./inner.js`
/// share the `main` chunk.
fn fixture() -> Fixture {
  let mut compilation = Compilation::new(normalize_options(CompilerOptions::default()).into());
  let index = compilation.add_normal_module("./index.js", "import './inner.js';\nexport { a };");
  let inner = compilation.add_normal_module("./inner.js", "export const a = 1;");
  let other = compilation.add_normal_module("./other.js", "import './index.js';");

  let index_to_inner = compilation
    .add_dependency(index, Dependency::new("./inner.js", Span::new(0, 20), DependencyKind::Import));
  compilation.add_dependency(
    index,
    Dependency::new(
      "",
      Span::new(21, 34),
      DependencyKind::ExportSpecifier { local: "a".into(), exported: "a".into() },
    ),
  );
  let other_to_index = compilation
    .add_dependency(other, Dependency::new("./index.js", Span::new(0, 20), DependencyKind::Import));
  compilation.connect(index, index_to_inner, inner);
  compilation.connect(other, other_to_index, index);
  compilation.module_graph.exports_info_mut(index).provide("a");
  compilation.module_graph.module_graph_module_mut(index).depth = Some(0);

  let chunk = compilation.chunk_graph.add_chunk(Some("main".into()), RuntimeSpec::single("main"));
  compilation.chunk_graph.connect_chunk_and_entry_module(chunk, index);
  compilation.chunk_graph.connect_chunk_and_module(chunk, inner);

  Fixture { compilation, index, inner, other, index_to_inner, other_to_index, chunk }
}

fn config(fixture: &Fixture) -> ConcatConfiguration {
  let mut config = ConcatConfiguration::new(fixture.index, RuntimeSpec::default());
  config.add(fixture.inner);
  config
}

#[tokio::test]
async fn concatenated_module_replaces_root() {
  let mut fixture = fixture();
  let config = config(&fixture);
  let Fixture { compilation, index, inner, other, index_to_inner, other_to_index, chunk } =
    &mut fixture;

  let new_module = concatenate(compilation, config).await.unwrap();

  let concatenated = compilation.module(new_module).as_concatenated().unwrap();
  assert!(concatenated.built);
  assert_eq!(&*concatenated.id, "./index.js|concatenated(2)|main");
  assert_eq!(concatenated.runtime, RuntimeSpec::single("main"));

  assert!(!compilation.modules.contains(index));
  assert!(compilation.modules.contains(&new_module));
  assert!(compilation.built_modules.contains(&new_module));

  assert!(!compilation.module_graph.has_connections(*index));
  assert!(compilation.module_graph.module_graph_module(*index).is_none());
  assert_eq!(compilation.module_graph.get_module(*other_to_index), Some(new_module));
  assert_eq!(compilation.module_graph.get_module(*index_to_inner), None);
  assert_eq!(
    compilation.module_graph.outgoing_connections(*other).map(|c| c.module).collect::<Vec<_>>(),
    [new_module]
  );

  let mgm = compilation.module_graph.module_graph_module(new_module).unwrap();
  assert_eq!(mgm.depth, Some(0));
  assert!(mgm.exports.export_info("a").is_some());

  assert_eq!(compilation.chunk_graph.chunk_modules(*chunk).collect::<Vec<_>>(), [new_module]);
  assert_eq!(compilation.chunk_graph.chunk(*chunk).entry_module, Some(new_module));
  assert_eq!(compilation.chunk_graph.module_chunks(*inner).count(), 0);
}

#[tokio::test]
async fn concatenated_module_renders_members_without_inlined_imports() {
  let mut fixture = fixture();
  let config = config(&fixture);
  let new_module = concatenate(&mut fixture.compilation, config).await.unwrap();

  let code = esmpack::render_module(&fixture.compilation, new_module).unwrap();
  // Nothing is left of the root once its import and export statements are dropped.
  assert_eq!(code, "//#region ./inner.js\nexport const a = 1;\n//#endregion");
}

#[derive(Debug)]
struct FailingBuilder;

impl ModuleBuilder for FailingBuilder {
  fn build<'a>(
    &'a self,
    _: &'a mut ConcatenatedModule,
    _: BuildContext<'a>,
  ) -> BoxFuture<'a, anyhow::Result<()>> {
    Box::pin(async { Err(anyhow::anyhow!("boom")) })
  }
}

#[tokio::test]
async fn failed_build_leaves_graph_untouched() {
  let mut fixture = fixture();
  let config = config(&fixture);
  let Fixture { compilation, index, inner, other_to_index, index_to_inner, chunk, .. } =
    &mut fixture;
  compilation.module_builder = Arc::new(FailingBuilder);
  let module_count = compilation.module_table.modules.len();

  let error = concatenate(compilation, config).await.unwrap_err();
  let error = error[0].downcast_ref::<ModuleBuildError>().unwrap();
  assert_eq!(error.module.as_deref(), Some("./index.js|concatenated(2)|main"));
  assert_eq!(error.source.to_string(), "boom");

  assert_eq!(compilation.module_table.modules.len(), module_count);
  assert!(compilation.modules.contains(index));
  assert_eq!(compilation.module_graph.get_module(*other_to_index), Some(*index));
  assert_eq!(compilation.module_graph.get_module(*index_to_inner), Some(*inner));
  assert_eq!(compilation.chunk_graph.chunk_modules(*chunk).collect::<Vec<_>>(), [*index, *inner]);
  assert_eq!(compilation.chunk_graph.chunk(*chunk).entry_module, Some(*index));
}

#[tokio::test]
async fn external_root_is_rejected() {
  let mut fixture = fixture();
  let external =
    fixture.compilation.add_external_module("ext", "ext", esmpack::ExternalType::Module);
  let modules = fixture.compilation.modules.clone();

  let config = ConcatConfiguration::new(external, RuntimeSpec::default());
  assert!(concatenate(&mut fixture.compilation, config).await.is_err());
  assert_eq!(fixture.compilation.modules, modules);
}
