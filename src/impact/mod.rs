//! Impact composition: "what is affected by changing this symbol".
//!
//! Every impacted symbol contributes its usage graph. With containment
//! followed, the chain of enclosing symbols is added too, and every link of
//! that chain may in turn contribute its caller, supertype and subtype
//! hierarchies. Partial graphs are produced lazily and folded with
//! [`RelationGraph::merge_by`](crate::graph::RelationGraph::merge_by) at a
//! single point, so a symbol reached by several sub-queries ends up as one
//! vertex.

pub mod options;

pub use options::{ImpactOptions, ImpactRequest};

use std::iter;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{tolerated, ImpactError, Result};
use crate::graph::{to_graph, EdgeKind, ReferenceGraph};
use crate::reference::{Reference, ReferenceTree};
use crate::referencer::Referencer;
use crate::resolver::{Position, Resolver};

/// Hierarchies hung off the containment chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Callers,
    Supertypes,
    Subtypes,
}

impl Relation {
    fn as_str(&self) -> &'static str {
        match self {
            Relation::Callers => "callers",
            Relation::Supertypes => "supertypes",
            Relation::Subtypes => "subtypes",
        }
    }

    /// Callers and supertypes point at the symbol they impact.
    fn reverse_edge(&self) -> bool {
        !matches!(self, Relation::Subtypes)
    }
}

/// Builds impact graphs from [`Referencer`] queries under fixed options.
#[derive(Debug)]
pub struct ImpactAnalyzer<'a, R> {
    referencer: &'a Referencer<R>,
    options: ImpactOptions,
}

impl<'a, R: Resolver> ImpactAnalyzer<'a, R> {
    /// Options are normalized on the way in.
    pub fn new(referencer: &'a Referencer<R>, options: ImpactOptions) -> Self {
        Self {
            referencer,
            options: options.normalized(),
        }
    }

    pub fn options(&self) -> &ImpactOptions {
        &self.options
    }

    // ─── Entry Points ───────────────────────────────────────────

    /// Impact of everything a request names, merged.
    ///
    /// A request item whose query fails recoverably is logged and skipped.
    /// Fails with [`ImpactError::NoResults`] when nothing at all came back.
    pub fn build_graph(&self, request: &ImpactRequest) -> Result<ReferenceGraph> {
        let files = request
            .files
            .iter()
            .map(|file| tolerated("file", file.display(), self.impact_file(file)));
        let locations = request.locations.iter().map(|(file, pos)| {
            tolerated(
                "location",
                format!("{}:{pos}", file.display()),
                self.impact_location(file, *pos),
            )
        });
        let names = request
            .names
            .iter()
            .map(|name| tolerated("name", name, self.impact_name(name, false)));
        let fuzzy_names = request
            .fuzzy_names
            .iter()
            .map(|name| tolerated("fuzzy name", name, self.impact_name(name, true)));

        let graph = merge_all(
            files
                .chain(locations)
                .chain(names)
                .chain(fuzzy_names)
                .map(|partial| partial.map(Option::unwrap_or_default)),
        )?;

        if graph.is_empty() {
            return Err(ImpactError::NoResults);
        }
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "impact graph built"
        );
        Ok(graph)
    }

    /// Final shaping of a built graph: one vertex per file when
    /// `file_level_only` is set, untouched otherwise.
    pub fn adjust_graph(&self, graph: ReferenceGraph) -> ReferenceGraph {
        if !self.options.file_level_only {
            return graph;
        }
        let adjusted = graph.map(|reference| Reference::file(&reference.uri));
        debug!(
            before = graph.vertex_count(),
            after = adjusted.vertex_count(),
            "collapsed to file level"
        );
        adjusted
    }

    /// The file's outline plus the impact of every symbol defined in it.
    pub fn impact_file(&self, file: &Path) -> Result<ReferenceGraph> {
        debug!(file = %file.display(), "impact of file");
        let root = self.referencer.query_file(file)?;
        let outline = to_graph(&root, EdgeKind::Solid, false);
        let symbols = root
            .children
            .iter()
            .flat_map(ReferenceTree::iter)
            .map(|reference| self.reference_impact(reference));
        merge_all(iter::once(Ok(outline)).chain(symbols))
    }

    /// Impact of the symbol at `pos`. [`ImpactError::NotFound`] when no
    /// symbol covers it.
    pub fn impact_location(&self, file: &Path, pos: Position) -> Result<ReferenceGraph> {
        let reference = self
            .referencer
            .query_location(file, pos)?
            .ok_or_else(|| ImpactError::not_found(format!("symbol at {}:{pos}", file.display())))?;
        self.reference_impact(&reference)
    }

    /// Impact of every symbol matching `name`.
    pub fn impact_name(&self, name: &str, fuzzy: bool) -> Result<ReferenceGraph> {
        let references = self.referencer.query_name(name, fuzzy)?;
        debug!(name, fuzzy, matches = references.len(), "impact of name");
        merge_all(
            references
                .iter()
                .map(|reference| self.reference_impact(reference)),
        )
    }

    // ─── Composition ────────────────────────────────────────────

    /// Impact of a single symbol under the analyzer's options.
    pub fn reference_impact(&self, reference: &Reference) -> Result<ReferenceGraph> {
        let usages = tolerated(
            "references",
            reference,
            self.referencer
                .find_references(reference)
                .map(|tree| to_graph(&tree, EdgeKind::Solid, false)),
        )?;

        let path = if self.options.follow_containment {
            tolerated(
                "containment",
                reference,
                self.referencer.find_container_path(reference),
            )?
        } else {
            None
        };
        let containment = path
            .as_ref()
            .map(|path| to_graph(path, EdgeKind::Dashed, true));

        let hierarchies = path
            .iter()
            .filter(|_| self.options.follows_hierarchies())
            .flat_map(ReferenceTree::iter)
            .map(|node| self.node_hierarchies(node));

        merge_all(
            usages
                .into_iter()
                .chain(containment)
                .map(Ok)
                .chain(hierarchies),
        )
    }

    /// Requested hierarchies of one containment-chain node, gated by kind.
    fn node_hierarchies(&self, node: &Reference) -> Result<ReferenceGraph> {
        let wanted = [
            (
                Relation::Callers,
                self.options.follow_calls && node.kind.is_callable(),
            ),
            (
                Relation::Supertypes,
                self.options.follow_supertypes && node.kind.is_type(),
            ),
            (
                Relation::Subtypes,
                self.options.follow_subtypes && node.kind.is_type(),
            ),
        ];
        merge_all(
            wanted
                .into_iter()
                .filter(|(_, on)| *on)
                .map(|(relation, _)| self.hierarchy_graph(node, relation)),
        )
    }

    fn hierarchy_graph(&self, node: &Reference, relation: Relation) -> Result<ReferenceGraph> {
        let tree = match relation {
            Relation::Callers => self.referencer.find_caller_hierarchies(node),
            Relation::Supertypes => self.referencer.find_supertype_hierarchies(node),
            Relation::Subtypes => self.referencer.find_subtype_hierarchies(node),
        };
        let graph = tree.map(|tree| to_graph(&tree, EdgeKind::Dashed, relation.reverse_edge()));
        Ok(tolerated(relation.as_str(), node, graph)?.unwrap_or_default())
    }
}

/// Impact of `request`, shaped by `options`, in one call.
pub fn analyze<R: Resolver>(
    referencer: &Referencer<R>,
    options: ImpactOptions,
    request: &ImpactRequest,
) -> Result<ReferenceGraph> {
    let analyzer = ImpactAnalyzer::new(referencer, options);
    let graph = analyzer.build_graph(request)?;
    Ok(analyzer.adjust_graph(graph))
}

/// Fold partial graphs into one, stopping at the first hard failure.
fn merge_all<I>(partials: I) -> Result<ReferenceGraph>
where
    I: IntoIterator<Item = Result<ReferenceGraph>>,
{
    partials
        .into_iter()
        .try_fold(ReferenceGraph::new(), |mut merged, partial| {
            merged.merge_by(&partial?);
            Ok(merged)
        })
}
