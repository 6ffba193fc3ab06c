/*!

This is the long-form manual for `vote_certainty` and `votecheck`.

## Certainty of a partial result

While an election is running, the results backend publishes snapshots of the
current tally. Each snapshot carries:

* the tally of every option (party, candidate, ...)
* the number of votes counted so far
* the number of eligible voters
* the _universe_: the largest number of votes the election could ever record.

The leading option is declared the _mathematically certain_ winner when its
advantage over the runner-up is strictly greater than the number of votes
still to come (`universe - counted`). In that case, even if every remaining
vote went to the runner-up, the leader would stay ahead.

Some special cases:
- an election that is not active is never reported as decided: the question
  only makes sense while votes are coming in. Use `final_outcome` instead.
- an election with a single option is always decided.
- an election without any option is never decided.
- when more votes were counted than the universe allows, the backend data is
  inconsistent. The current leader is reported as decided anyway.

When several options have the same tally, they are ordered by name. For
example, with `{"Beta": 10, "Alpha": 10}`, `Alpha` is the leader.

## Identifiers

Voters are identified by their CPF number: 11 digits, usually written
`###.###.###-##`. The last two digits are check digits. An identifier is
refused when:
* it does not contain exactly 11 digits (all the other characters are ignored)
* all its digits are identical (`111.111.111-11`)
* one of the check digits does not match.

## The `votecheck` program

`votecheck` reads result snapshots in the JSON format of the results backend:

```text
{
  "serialeleicao": 1718,
  "ativaeleicao": true,
  "totalpopulacao": 200,
  "totalvotos": 141,
  "totalpossiveiseleitores": 200,
  "votos_por_partido": {"A": 101, "B": 40}
}
```

The file may also contain a list of such objects. Each of them is checked
independently:

```bash
votecheck -i results.json --out summary.json
```

Identifiers can be checked in the same run or on their own:

```bash
votecheck --cpf 529.982.247-25 --cpf 111.111.111-11
```

With `--reference expected.json`, the summary is compared with the content of
`expected.json` and the program fails if they differ. Use `--verbose` or the
`RUST_LOG` environment variable to see the details of the computation.

*/
