/*!

This is the long-form manual for `electoral_tally` and `evtally`.

## The feed documents

Each state publishes one JSON document describing all of its races. The
pipeline only looks at the single race matching the configured (office, type)
selector, `President` / `General` by default. A trimmed-down document looks
like this:

```json
{
  "races": [
    {
      "type": "General",
      "office": "President",
      "outcome": { "won": ["harris-k"], "electoral_votes": 16 },
      "reporting_units": [
        {
          "nyt_id": "webster-county",
          "name": "Webster",
          "level": "county",
          "total_votes": 15233,
          "total_expected_vote": 17800,
          "candidates": [
            { "nyt_id": "harris-k", "leader": true, "votes": { "total": 8120 } },
            { "nyt_id": "trump-d", "votes": { "total": 7113 } }
          ]
        }
      ]
    }
  ]
}
```

Documents are filled in progressively over an election night. Any of the
fields above can be missing or null, and the library treats all of these as
"no data yet" rather than as errors:

- a race without an `outcome` block: counting is in progress, no winner has
  been declared. The per-unit summaries are still produced.
- a candidate tally with a `leader` flag but no `votes.total`: the candidate
  is flagged as ahead before a count is attached.
- a document with no race matching the selector at all: the state simply has
  nothing to report for the target office.

## The aggregation

[`aggregate`](crate::aggregate) walks the configured states in order, calls
the fetch collaborator for each, extracts the target race and folds declared
outcomes into a per-candidate table:

```text
candidate id -> state id -> electoral votes
```

Only states with both a declared winner and an electoral vote count
contribute. Everything else is recorded in the skip ledger with a
[`SkipReason`](crate::SkipReason), so a run over fifty states with one
unreachable feed still produces the other forty-nine entries.

The recognized candidate set is configuration, not data: a declared winner
outside that set is skipped with a warning instead of growing the table.

*/
