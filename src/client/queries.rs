//! GraphQL documents sent to GitLab

pub const ITERATIONS: &str = r#"
query GroupIterations($fullPath: ID!, $first: Int!, $after: String) {
  group(fullPath: $fullPath) {
    id
    iterations(first: $first, after: $after, includeAncestors: true) {
      nodes {
        id
        iid
        title
        startDate
        dueDate
        state
        webUrl
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

pub const ITERATION_ISSUES: &str = r#"
query IterationIssues($fullPath: ID!, $iterationId: [ID!], $first: Int!, $after: String) {
  group(fullPath: $fullPath) {
    issues(iterationId: $iterationId, includeSubgroups: true, first: $first, after: $after) {
      nodes {
        id
        iid
        title
        state
        createdAt
        closedAt
        weight
        webUrl
        labels {
          nodes {
            title
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

pub const ISSUE_NOTES: &str = r#"
query IssueNotes($id: IssueID!, $first: Int!, $after: String) {
  issue(id: $id) {
    notes(first: $first, after: $after) {
      nodes {
        id
        body
        system
        createdAt
        systemNoteMetadata {
          action
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

pub const MERGED_MERGE_REQUESTS: &str = r#"
query MergedMergeRequests($fullPath: ID!, $mergedAfter: Time, $mergedBefore: Time, $first: Int!, $after: String) {
  project(fullPath: $fullPath) {
    mergeRequests(state: merged, mergedAfter: $mergedAfter, mergedBefore: $mergedBefore, first: $first, after: $after) {
      nodes {
        id
        iid
        title
        createdAt
        mergedAt
        sourceBranch
        targetBranch
        webUrl
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

pub const PIPELINES: &str = r#"
query ProjectPipelines($fullPath: ID!, $ref: String, $updatedAfter: Time, $updatedBefore: Time, $first: Int!, $after: String) {
  project(fullPath: $fullPath) {
    pipelines(ref: $ref, updatedAfter: $updatedAfter, updatedBefore: $updatedBefore, first: $first, after: $after) {
      nodes {
        id
        status
        ref
        createdAt
        finishedAt
        duration
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

pub const INCIDENTS: &str = r#"
query ProjectIncidents($fullPath: ID!, $createdAfter: Time, $createdBefore: Time, $first: Int!, $after: String) {
  project(fullPath: $fullPath) {
    issues(types: [INCIDENT], createdAfter: $createdAfter, createdBefore: $createdBefore, first: $first, after: $after) {
      nodes {
        id
        iid
        title
        state
        createdAt
        closedAt
        labels {
          nodes {
            title
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;
